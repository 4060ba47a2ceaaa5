// src/bin/cli.rs
fn main() -> color_eyre::Result<()> {
    qd_conform::cli::run()
}
