use std::process::ExitCode;

fn main() -> ExitCode {
    borong_cli::run()
}
