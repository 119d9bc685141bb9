fn main() -> anyhow::Result<()> {
    flow_labs::demos::earth_moon::run()
}
