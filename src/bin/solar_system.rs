fn main() -> anyhow::Result<()> {
    flow_labs::demos::solar_system::run()
}
