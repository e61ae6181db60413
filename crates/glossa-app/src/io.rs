use std::io::{BufRead, Write};

use kanal::AsyncSender;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::events::AppEvent;

/// Forward stdin lines as events until EOF, `:quit` or cancellation.
///
/// Reads on a plain thread: a blocked stdin read cannot be interrupted, and
/// the runtime must not wait on it at shutdown.
pub async fn watcher_io(
    cancel: CancellationToken,
    event_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let handle = Handle::current();
    let prompt = atty::is(atty::Stream::Stdin);

    std::thread::Builder::new()
        .name("glossa-stdin".to_string())
        .spawn(move || {
            if let Err(e) = read_lines(&handle, &cancel, &event_tx, prompt) {
                tracing::error!("Input reader stopped: {e}");
            }
        })?;

    Ok(())
}

fn read_lines(
    handle: &Handle,
    cancel: &CancellationToken,
    event_tx: &AsyncSender<AppEvent>,
    prompt: bool,
) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        if prompt {
            print!("> ");
            std::io::stdout().flush()?;
        }

        let Some(line) = lines.next() else {
            tracing::debug!("Input closed");
            break;
        };
        let line = line?;

        if cancel.is_cancelled() {
            return Ok(());
        }

        if let Some(event) = AppEvent::parse(&line) {
            let quit = event == AppEvent::Quit;
            handle.block_on(event_tx.send(event))?;
            if quit {
                return Ok(());
            }
        }
    }

    handle.block_on(event_tx.send(AppEvent::Quit))?;
    Ok(())
}
