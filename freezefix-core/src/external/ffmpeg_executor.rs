// ============================================================================
// freezefix-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: FFmpeg Process Management
//
// Concrete ToolSpawner/ToolProcess pair on top of ffmpeg-sidecar. The
// spawned child is owned by `SidecarProcess` for its whole life:
//
// - the watched stream is read chunk by chunk by the caller
// - the other stream is drained on a background thread (logged at trace),
//   so ffmpeg never stalls on a full pipe
// - dropping the process before `wait` kills and reaps the child, which
//   covers early returns on read errors and unwinding

use super::{ProcessExit, ToolProcess, ToolSpawner, WatchedStream};
use crate::error::{CoreError, CoreResult, command_start_error, command_wait_error};
use ffmpeg_sidecar::child::FfmpegChild as SidecarChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use std::io::{self, BufRead, BufReader, Read};
use std::thread::{self, JoinHandle};

const TOOL_NAME: &str = "ffmpeg (sidecar)";

/// Running ffmpeg process with one watched output stream.
pub struct SidecarProcess {
    child: SidecarChild,
    watched: Box<dyn Read + Send>,
    drain: Option<JoinHandle<()>>,
    reaped: bool,
}

impl SidecarProcess {
    fn join_drain(&mut self) {
        if let Some(handle) = self.drain.take() {
            if handle.join().is_err() {
                log::warn!("ffmpeg output drain thread panicked");
            }
        }
    }
}

impl ToolProcess for SidecarProcess {
    fn read_chunk(&mut self, buf: &mut [u8]) -> CoreResult<usize> {
        loop {
            match self.watched.read(buf) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(CoreError::Io(e)),
            }
        }
    }

    fn wait(&mut self) -> CoreResult<ProcessExit> {
        let status = self
            .child
            .wait()
            .map_err(|e| command_wait_error(TOOL_NAME, e))?;
        self.reaped = true;
        self.join_drain();
        Ok(ProcessExit::from(status))
    }
}

impl Drop for SidecarProcess {
    fn drop(&mut self) {
        if !self.reaped {
            log::debug!("Terminating unfinished ffmpeg process");
            if let Err(e) = self.child.kill() {
                log::debug!("Failed to kill ffmpeg process: {}", e);
            }
            if let Err(e) = self.child.wait() {
                log::debug!("Failed to reap ffmpeg process: {}", e);
            }
        }
        self.join_drain();
    }
}

/// Concrete implementation of `ToolSpawner` using `ffmpeg-sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl SidecarSpawner {
    pub fn new() -> Self {
        Self
    }
}

impl ToolSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand, watch: WatchedStream) -> CoreResult<Self::Process> {
        let mut child = cmd.spawn().map_err(|e| command_start_error(TOOL_NAME, e))?;

        let streams = match watch {
            WatchedStream::Stdout => child.take_stdout().map(|out| {
                let other = child.take_stderr().map(|err| Box::new(err) as Box<dyn Read + Send>);
                (Box::new(out) as Box<dyn Read + Send>, other)
            }),
            WatchedStream::Stderr => child.take_stderr().map(|err| {
                let other = child.take_stdout().map(|out| Box::new(out) as Box<dyn Read + Send>);
                (Box::new(err) as Box<dyn Read + Send>, other)
            }),
        };

        let Some((watched, other)) = streams else {
            // the child is running but unreadable; do not leak it
            let _ = child.kill();
            let _ = child.wait();
            return Err(CoreError::Io(io::Error::other(format!(
                "{:?} of ffmpeg was not captured",
                watch
            ))));
        };

        let drain = other.map(|stream| {
            thread::spawn(move || {
                for line in BufReader::new(stream).lines() {
                    match line {
                        Ok(line) => log::trace!("ffmpeg side stream: {}", line),
                        Err(_) => break,
                    }
                }
            })
        });

        Ok(SidecarProcess {
            child,
            watched,
            drain,
            reaped: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::FfmpegCommandBuilder;

    #[test]
    fn test_spawn_failure_is_a_command_start_error() {
        let cmd = FfmpegCommandBuilder::new("/nonexistent/freezefix/ffmpeg").build();
        let result = SidecarSpawner::new().spawn(cmd, WatchedStream::Stderr);
        assert!(matches!(result, Err(CoreError::CommandStart(_, _))));
    }
}
