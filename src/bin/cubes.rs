fn main() -> anyhow::Result<()> {
    flow_labs::demos::cubes::run()
}
