use std::io::Write;
use std::{env, io, process};

fn main() {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let pretty = env::args().any(|a| a == "--pretty");
    let path = env::args()
        .skip(1)
        .find(|a| !a.starts_with("--"))
        .or_else(|| env::var("RELWIRE_INPUT").ok());

    let request = relwire_encode::read_request(path.as_deref()).unwrap_or_else(|e| {
        eprintln!("failed to read request: {e}");
        process::exit(1);
    });

    let object = relwire_encode::encode(&request).unwrap_or_else(|e| {
        eprintln!("failed to encode request: {e}");
        process::exit(1);
    });

    let mut stdout = io::stdout().lock();
    let written = if pretty {
        serde_json::to_writer_pretty(&mut stdout, &object)
    } else {
        serde_json::to_writer(&mut stdout, &object)
    };
    if let Err(e) = written.map_err(io::Error::from).and_then(|_| writeln!(stdout)) {
        eprintln!("failed to write payload: {e}");
        process::exit(1);
    }
}
