use bytes::Bytes;
use futures::TryStreamExt;

use crate::{ContentStream, Contents, FileTransform, FileUnit, Stage, StageError};

/// Initialize tracing for tests with appropriate settings
#[inline]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer() // Write to test output
        .try_init();
}

pub fn buffer_file(contents: &str) -> FileUnit {
    FileUnit::buffer("test.txt", Bytes::copy_from_slice(contents.as_bytes()))
}

pub fn stream_file(contents: &str) -> FileUnit {
    let chunk = Bytes::copy_from_slice(contents.as_bytes());
    FileUnit::stream("test.txt", ContentStream::from_chunks(vec![chunk]))
}

pub fn null_file() -> FileUnit {
    FileUnit::null("test.txt")
}

/// Run one file through a stage, collecting everything forwarded downstream.
pub fn run_stage<T: FileTransform>(
    stage: &mut Stage<T>,
    file: FileUnit,
) -> (Vec<FileUnit>, Result<(), StageError>) {
    let mut out = Vec::new();
    let mut output = |file: FileUnit| -> Result<(), StageError> {
        out.push(file);
        Ok(())
    };
    let result = stage.process(file, crate::DEFAULT_ENCODING, &mut output);
    (out, result)
}

/// Read the full contents of a file, draining its stream if needed.
pub fn read_contents(file: &FileUnit) -> Vec<u8> {
    match file.contents() {
        Contents::Buffer(data) => data.to_vec(),
        Contents::Stream(stream) => {
            let stream = stream.take().expect("stream already consumed");
            let chunks: Vec<Bytes> = futures::executor::block_on(stream.try_collect())
                .expect("stream failed");
            chunks.concat()
        }
        Contents::Null => Vec::new(),
    }
}
