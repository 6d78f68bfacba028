use parish_receipts::{
    cli::{output, run_cli, USAGE},
    init,
};

fn main() {
    init();

    if let Err(err) = run_cli() {
        output::error(&err);
        if err.is_usage() {
            eprintln!("{USAGE}");
        }
        std::process::exit(1);
    }
}
