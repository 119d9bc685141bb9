fn main() -> anyhow::Result<()> {
    flow_labs::demos::forest::run()
}
