fn main() -> anyhow::Result<()> {
    flow_labs::demos::coloring::run()
}
