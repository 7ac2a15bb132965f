use std::time::Duration;
use tokio::sync::mpsc;

/// Поглощает события, пришедшие в течение `window` после последнего.
/// Возвращает `false`, если источник закрылся.
pub async fn absorb_burst<T>(events: &mut mpsc::UnboundedReceiver<T>, window: Duration) -> bool {
    if window.is_zero() {
        return true;
    }
    loop {
        match tokio::time::timeout(window, events.recv()).await {
            Ok(Some(_)) => continue,
            Ok(None) => return false,
            Err(_) => return true,
        }
    }
}
