fn main() -> anyhow::Result<()> {
    flow_labs::demos::bunny::run()
}
