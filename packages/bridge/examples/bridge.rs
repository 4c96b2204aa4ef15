use std::time::Duration;

use cu_bridge::{CancellationToken, Operation};

async fn fetch_answer() -> cu_bridge::Result<u32> {
    tokio::time::sleep(Duration::from_millis(100)).await;
    Ok(42)
}

async fn fetch_forever() -> cu_bridge::Result<u32> {
    tokio::time::sleep(Duration::from_secs(3600)).await;
    Ok(0)
}

fn main() -> cu_bridge::Result<()> {
    cu_bridge::log_init();

    let answer = cu_bridge::wait(Operation::new(fetch_answer()))?;
    cu_bridge::info!("the answer is {answer}");
    println!("waited: {answer}");

    // a timeout is just a token cancelled by a timer
    let token = CancellationToken::new();
    let timer = token.clone();
    std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(200));
        timer.cancel();
    });
    match cu_bridge::wait_cancellable(Operation::new(fetch_forever()), &token) {
        Ok(_) => println!("finished?"),
        Err(e) if e.is::<cu_bridge::Cancelled>() => println!("timed out: {e}"),
        Err(e) => return Err(e),
    }

    let (send, recv) = std::sync::mpsc::channel();
    cu_bridge::detach_with(
        Operation::<()>::new(async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cu_bridge::bail!("background job failed")
        }),
        move |e| {
            let _ = send.send(e.to_string());
        },
    )?;
    println!("detached, still running");
    println!("handler saw: {}", recv.recv()?);
    Ok(())
}
