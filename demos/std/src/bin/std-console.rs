use std::io::{self, Read};
use std::sync::atomic::AtomicBool;
use std::thread;

use conline::render::std_io::StdoutWrapper;
use conline::sync::std_sync::CondvarQueue;
use conline::{builder::ConsoleBuilder, input::ControlKey, Console, SerialSink};
use crossbeam::channel::{self, Receiver, Sender};
use termion::raw::IntoRawMode;

type StdConsole = Console<SerialSink<StdoutWrapper>, CondvarQueue>;

const ESC: u8 = 0x1b;

// Stand-in for the keyboard driver: arrow escape sequences become the
// console's arrow key codes.
fn keyboard(keys: Sender<u8>) {
    let mut bytes = io::stdin().bytes().map_while(Result::ok);

    while let Some(byte) = bytes.next() {
        let key = match byte {
            ESC => match (bytes.next(), bytes.next()) {
                (Some(b'['), Some(b'A')) => ControlKey::Up.into(),
                (Some(b'['), Some(b'B')) => ControlKey::Down.into(),
                (Some(b'['), Some(b'C')) => ControlKey::Right.into(),
                (Some(b'['), Some(b'D')) => ControlKey::Left.into(),
                _ => continue,
            },
            byte => byte,
        };

        if keys.send(key).is_err() {
            break;
        }
    }
}

// Stand-in for the interrupt handler: one console pass per burst of keys.
fn interrupts(console: &StdConsole, keys: Receiver<u8>, done: Receiver<()>) {
    loop {
        crossbeam::select! {
            recv(keys) -> key => {
                let mut pending = match key {
                    Ok(key) => Some(key),
                    Err(_) => break,
                };
                let mut source = || pending.take().or_else(|| keys.try_recv().ok());

                let summary = console.interrupt(&mut source);

                if summary.process_list {
                    console.print(format_args!("\n1 sleep  init\n2 run    std-console\n"));
                }
            }
            recv(done) -> _ => break,
        }
    }
}

fn main() {
    let _raw_term = io::stdout().into_raw_mode().unwrap();

    let console: StdConsole =
        ConsoleBuilder::from_sink(SerialSink::new(StdoutWrapper::new()).with_crlf())
            .with_wait_queue(CondvarQueue::new())
            .build();

    let (keys_tx, keys_rx) = channel::unbounded();
    let (done_tx, done_rx) = channel::bounded::<()>(0);
    let cancel = AtomicBool::new(false);

    thread::spawn(move || keyboard(keys_tx));

    crossbeam::scope(|s| {
        s.spawn(|_| interrupts(&console, keys_rx, done_rx));

        let mut line = [0; 128];

        loop {
            console.print(format_args!("$ "));

            match console.read_line(&mut line, &cancel) {
                Ok(0) => break,
                Ok(len) => console.print(format_args!(
                    "Read: '{}'\n",
                    String::from_utf8_lossy(&line[..len]).trim_end()
                )),
                Err(err) => {
                    console.print(format_args!("read failed: {}\n", err));
                    break;
                }
            }
        }

        drop(done_tx);
    })
    .unwrap();
}
