fn main() -> anyhow::Result<()> {
    flow_labs::demos::spaceship::run()
}
