fn main() -> anyhow::Result<()> {
    pedmap_convert::cli::run()
}
