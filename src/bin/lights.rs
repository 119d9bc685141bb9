fn main() -> anyhow::Result<()> {
    flow_labs::demos::lights::run()
}
