use std::process::ExitCode;

fn main() -> ExitCode {
    clichat_cli::run()
}
