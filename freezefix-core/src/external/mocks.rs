// freezefix-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// Compiled for unit tests and when the "test-mocks" feature is enabled.

use super::{ProcessExit, ToolProcess, ToolSpawner, WatchedStream};
use crate::error::{CoreError, CoreResult};
use ffmpeg_sidecar::command::FfmpegCommand;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

/// Mock implementation of ToolProcess replaying scripted output chunks.
#[derive(Clone)]
pub struct MockToolProcess {
    chunks: VecDeque<Vec<u8>>,
    exit: ProcessExit,
    read_error: bool,
    waited: Rc<Cell<bool>>,
}

impl MockToolProcess {
    /// A process that emits `chunks` in order, then exits with `exit_code`.
    pub fn new(chunks: Vec<Vec<u8>>, exit_code: i32) -> Self {
        Self {
            chunks: chunks.into(),
            exit: ProcessExit::from_code(Some(exit_code)),
            read_error: false,
            waited: Rc::new(Cell::new(false)),
        }
    }

    /// A process emitting `text` cut into chunks of `chunk_size` bytes, so
    /// lines (and characters) straddle chunk boundaries.
    pub fn from_text(text: &str, chunk_size: usize, exit_code: i32) -> Self {
        let chunks = text
            .as_bytes()
            .chunks(chunk_size.max(1))
            .map(<[u8]>::to_vec)
            .collect();
        Self::new(chunks, exit_code)
    }

    /// A process killed by a signal: no exit code.
    pub fn killed(mut self) -> Self {
        self.exit = ProcessExit::from_code(None);
        self
    }

    /// Fails the read that follows the last scripted chunk.
    pub fn with_read_error(mut self) -> Self {
        self.read_error = true;
        self
    }

    /// Handle reporting whether `wait` was called on this process.
    pub fn waited_flag(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.waited)
    }
}

impl ToolProcess for MockToolProcess {
    fn read_chunk(&mut self, buf: &mut [u8]) -> CoreResult<usize> {
        match self.chunks.pop_front() {
            Some(mut chunk) => {
                if chunk.len() > buf.len() {
                    let rest = chunk.split_off(buf.len());
                    self.chunks.push_front(rest);
                }
                buf[..chunk.len()].copy_from_slice(&chunk);
                Ok(chunk.len())
            }
            None if self.read_error => {
                self.read_error = false;
                Err(CoreError::Io(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "mock read failure",
                )))
            }
            None => Ok(0),
        }
    }

    fn wait(&mut self) -> CoreResult<ProcessExit> {
        self.waited.set(true);
        Ok(self.exit)
    }
}

/// A call received by the mock spawner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedCall {
    pub args: Vec<String>,
    pub watch: WatchedStream,
}

impl ReceivedCall {
    /// Value following `flag` in the argument list.
    pub fn arg_after(&self, flag: &str) -> Option<&str> {
        let index = self.args.iter().position(|a| a == flag)?;
        self.args.get(index + 1).map(String::as_str)
    }

    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }
}

/// Mock implementation of ToolSpawner handing out scripted processes in
/// order and recording every command it receives.
#[derive(Clone, Default)]
pub struct MockToolSpawner {
    results: Rc<RefCell<VecDeque<CoreResult<MockToolProcess>>>>,
    received_calls: Rc<RefCell<Vec<ReceivedCall>>>,
}

impl MockToolSpawner {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_process(&self, process: MockToolProcess) {
        self.results.borrow_mut().push_back(Ok(process));
    }

    /// Queues a successful process emitting `text` in chunks of `chunk_size`.
    pub fn add_output(&self, text: &str, chunk_size: usize, exit_code: i32) {
        self.add_process(MockToolProcess::from_text(text, chunk_size, exit_code));
    }

    /// Queues a launch failure.
    pub fn add_spawn_error(&self, kind: io::ErrorKind) {
        let err = CoreError::CommandStart(
            "ffmpeg (mock)".to_string(),
            io::Error::new(kind, "mock spawn failure"),
        );
        self.results.borrow_mut().push_back(Err(err));
    }

    pub fn get_received_calls(&self) -> Vec<ReceivedCall> {
        self.received_calls.borrow().clone()
    }
}

impl ToolSpawner for MockToolSpawner {
    type Process = MockToolProcess;

    fn spawn(&self, cmd: FfmpegCommand, watch: WatchedStream) -> CoreResult<Self::Process> {
        let args: Vec<String> = cmd
            .get_args()
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        log::debug!("MockToolSpawner received {:?} watching {:?}", args, watch);
        self.received_calls
            .borrow_mut()
            .push(ReceivedCall { args, watch });

        match self.results.borrow_mut().pop_front() {
            Some(result) => result,
            None => panic!("MockToolSpawner: no scripted process left for this call"),
        }
    }
}
