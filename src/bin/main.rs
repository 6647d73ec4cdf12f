use longmap::console::{reader, Console, Flow};
use longmap::session::Session;
use std::{env, io};
use tracing_chrome::{ChromeLayerBuilder, FlushGuard};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// Logs go to stderr, filtered by LONGMAP_LOG. If LONGMAP_TRACE names a file, a
// Chrome trace is written there as well.
fn init_tracing() -> Option<FlushGuard> {
    let filter = EnvFilter::try_from_env("LONGMAP_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let (chrome, guard) = match env::var_os("LONGMAP_TRACE") {
        Some(path) => {
            let (layer, guard) = ChromeLayerBuilder::new().file(path).build();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .with(chrome)
        .init();
    guard
}

fn main() -> io::Result<()> {
    let _guard = init_tracing();
    let mut session = Session::new();
    if let Some(size) = env::args().nth(1) {
        let provisioned = size
            .parse()
            .map_err(|_| format!("Invalid block size: {size}"))
            .and_then(|size| session.provision(size));
        if let Err(e) = provisioned {
            eprintln!("{e}");
        }
    }

    let mut buffer = String::new();
    loop {
        if io::stdin().read_line(&mut buffer)? == 0 {
            break;
        }
        match reader::read_console_line(&buffer, &mut session) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => eprintln!("{e}"),
        }
        buffer.clear();
    }
    Ok(())
}
