fn main() -> anyhow::Result<()> {
    flow_labs::demos::skybox::run()
}
