//! Binary entrypoint for lintcfg-cli (made by FontLab https://www.fontlab.com/)

use std::io::Write;

fn main() {
    env_logger::builder()
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .init();

    if let Err(err) = lintcfg_cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
