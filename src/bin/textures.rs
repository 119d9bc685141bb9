fn main() -> anyhow::Result<()> {
    flow_labs::demos::textures::run()
}
