use std::process;

use clap::Parser;
use probe::{Cli, OutputSink, Runner, UreqTransport};
use probe_core::CommunicationClient;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = probe::logger::init_logger(cli.log_level, cli.log_file.as_deref()) {
        eprintln!("{e}");
        process::exit(2);
    }

    let client = CommunicationClient::new(&cli.base_url);
    let transport = UreqTransport::new(cli.timeout());
    let sink = OutputSink::stdout();

    let code = match Runner::new(client, &transport, &sink).run(&cli.command()) {
        Ok(status) => status.exit_code(cli.strict),
        Err(e) => {
            log::error!("[MAIN] {}", e);
            1
        }
    };
    process::exit(code);
}
