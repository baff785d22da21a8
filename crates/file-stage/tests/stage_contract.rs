use std::sync::Arc;

use bytes::Bytes;
use file_stage::{
    ContentStream, Contents, FileTransform, FileUnit, HookError, Processor, Stage, StageConfig,
    StageContext, StageError, TransformContext,
};
use futures::{StreamExt, TryStreamExt};

/// Forwards every input unchanged.
struct Identity;

impl FileTransform for Identity {
    const NAME: &'static str = "IdentityTransform";

    fn transform_buffer_file(
        &mut self,
        file: FileUnit,
        _contents: Bytes,
        _encoding: &str,
        cx: &mut TransformContext<'_>,
    ) -> Result<(), HookError> {
        cx.done(Some(file));
        Ok(())
    }

    fn transform_stream_file(
        &mut self,
        file: FileUnit,
        _contents: ContentStream,
        _encoding: &str,
        cx: &mut TransformContext<'_>,
    ) -> Result<(), HookError> {
        cx.done(Some(file));
        Ok(())
    }
}

/// Uppercases contents, piping streams lazily. Skips `.bin` files and drops
/// empty buffers.
struct Upper;

impl FileTransform for Upper {
    const NAME: &'static str = "UpperTransform";

    fn filter_file(&self, file: &FileUnit) -> Result<bool, HookError> {
        Ok(matches!(file.contents(), Contents::Buffer(data) if data.is_empty()))
    }

    fn ignore_file(&self, file: &FileUnit) -> Result<bool, HookError> {
        Ok(file.path().extension().is_some_and(|ext| ext == "bin"))
    }

    fn transform_buffer_file(
        &mut self,
        file: FileUnit,
        contents: Bytes,
        _encoding: &str,
        cx: &mut TransformContext<'_>,
    ) -> Result<(), HookError> {
        let upper = Bytes::from(contents.to_ascii_uppercase());
        cx.done(Some(file.with_contents(Contents::Buffer(upper))));
        Ok(())
    }

    fn transform_stream_file(
        &mut self,
        file: FileUnit,
        contents: ContentStream,
        _encoding: &str,
        cx: &mut TransformContext<'_>,
    ) -> Result<(), HookError> {
        let upstream = contents.take().ok_or("stream already consumed")?;
        let piped = upstream
            .map_ok(|chunk| Bytes::from(chunk.to_ascii_uppercase()))
            .boxed();
        let piped = ContentStream::new(piped);
        cx.done(Some(file.with_contents(Contents::Stream(piped))));
        Ok(())
    }
}

/// Splits a buffer into one unit per line, but emits a stream for a line
/// reading "stream".
struct LineSplitter;

impl FileTransform for LineSplitter {
    const NAME: &'static str = "LineSplitterTransform";

    fn options(&self) -> StageConfig {
        StageConfig::builder().supports_stream(false).build()
    }

    fn transform_buffer_file(
        &mut self,
        file: FileUnit,
        contents: Bytes,
        _encoding: &str,
        cx: &mut TransformContext<'_>,
    ) -> Result<(), HookError> {
        let text = std::str::from_utf8(&contents).map_err(HookError::error)?;
        for (index, line) in text.lines().enumerate() {
            let path = file.path().with_extension(format!("{index}.txt"));
            let unit = if line == "stream" {
                FileUnit::stream(path, ContentStream::empty())
            } else {
                FileUnit::buffer(path, Bytes::copy_from_slice(line.as_bytes()))
            };
            cx.push(unit);
        }
        Ok(())
    }

    fn transform_stream_file(
        &mut self,
        _file: FileUnit,
        _contents: ContentStream,
        _encoding: &str,
        _cx: &mut TransformContext<'_>,
    ) -> Result<(), HookError> {
        Err("streams are disabled for this stage".into())
    }
}

fn drive<P: Processor<FileUnit>>(
    processor: &mut P,
    inputs: Vec<FileUnit>,
) -> (Vec<FileUnit>, Vec<Result<(), StageError>>) {
    let context = Arc::new(StageContext::with_name("contract"));
    let mut out = Vec::new();
    let mut results = Vec::new();
    let mut output = |file: FileUnit| -> Result<(), StageError> {
        out.push(file);
        Ok(())
    };
    for input in inputs {
        results.push(processor.process(&context, input, &mut output));
    }
    processor.finish(&context, &mut output).unwrap();
    (out, results)
}

fn contents_of(file: &FileUnit) -> Vec<u8> {
    match file.contents() {
        Contents::Buffer(data) => data.to_vec(),
        Contents::Stream(stream) => {
            let stream = stream.take().unwrap();
            let chunks: Vec<Bytes> = futures::executor::block_on(stream.try_collect()).unwrap();
            chunks.concat()
        }
        Contents::Null => Vec::new(),
    }
}

fn stream_of(chunks: &[&'static str]) -> ContentStream {
    let chunks: Vec<Bytes> = chunks
        .iter()
        .map(|&c| Bytes::from_static(c.as_bytes()))
        .collect();
    ContentStream::from_chunks(chunks)
}

#[test]
fn identity_stage_round_trips_every_representation() {
    let handle = stream_of(&["a", "b"]);
    let inputs = vec![
        FileUnit::buffer("one.txt", "first"),
        FileUnit::stream("two.txt", handle.clone()),
        FileUnit::null("three.txt"),
    ];

    let mut stage = Stage::new(Identity);
    let (out, results) = drive(&mut stage, inputs);

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(out.len(), 3);
    assert_eq!(out[0].path().to_str(), Some("one.txt"));
    assert_eq!(contents_of(&out[0]), b"first");
    assert!(matches!(out[1].contents(), Contents::Stream(s) if s.ptr_eq(&handle)));
    assert_eq!(contents_of(&out[1]), b"ab");
    assert!(out[2].is_null());
}

#[test]
fn upper_stage_filters_ignores_and_transforms() {
    let inputs = vec![
        FileUnit::buffer("empty.txt", ""),
        FileUnit::buffer("raw.bin", "keep me"),
        FileUnit::buffer("note.txt", "hello"),
        FileUnit::stream("log.txt", stream_of(&["abc", "def"])),
    ];

    let mut stage = Stage::new(Upper);
    assert_eq!(stage.plugin_name(), "stage-upper");
    let (out, results) = drive(&mut stage, inputs);

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(out.len(), 3);
    assert_eq!(contents_of(&out[0]), b"keep me");
    assert_eq!(contents_of(&out[1]), b"HELLO");
    assert!(out[2].is_stream());
    assert_eq!(contents_of(&out[2]), b"ABCDEF");
}

#[test]
fn transform_options_narrow_representations() {
    let mut stage = Stage::new(LineSplitter);
    assert!(stage.settings().supports_buffer());
    assert!(!stage.settings().supports_stream());

    let (out, results) = drive(&mut stage, vec![FileUnit::stream("in.txt", stream_of(&["x"]))]);
    assert!(out.is_empty());
    assert!(matches!(
        &results[0],
        Err(StageError::UnsupportedContentType { plugin, .. }) if plugin == "stage-linesplitter"
    ));
}

#[test]
fn instance_config_overrides_transform_options() {
    let config: StageConfig =
        serde_json::from_str(r#"{ "supportsStream": true, "pluginName": "split-lines" }"#)
            .unwrap();
    let mut stage = Stage::with_config(LineSplitter, config);

    let (out, results) = drive(&mut stage, vec![FileUnit::stream("in.txt", stream_of(&["x"]))]);
    assert!(out.is_empty());
    match &results[0] {
        Err(StageError::Plugin(error)) => {
            assert_eq!(error.plugin(), "split-lines");
            assert_eq!(error.message(), "streams are disabled for this stage");
        }
        other => panic!("expected plugin error, got {:?}", other),
    }
}

#[test]
fn emissions_before_a_mismatch_are_kept_and_later_ones_dropped() {
    let mut stage = Stage::new(LineSplitter);
    let inputs = vec![
        FileUnit::buffer("a.txt", "one\nstream\ntwo\nthree"),
        FileUnit::buffer("b.txt", "four\nfive"),
    ];
    let (out, results) = drive(&mut stage, inputs);

    let error = results[0].as_ref().unwrap_err();
    assert!(error.incorrect_transformed_file_type_error());
    assert!(results[1].is_ok());

    let lines: Vec<Vec<u8>> = out.iter().map(contents_of).collect();
    assert_eq!(lines, vec![b"one".to_vec(), b"four".to_vec(), b"five".to_vec()]);
}

#[test]
fn invalid_utf8_is_wrapped_with_its_source() {
    let mut stage = Stage::new(LineSplitter);
    let inputs = vec![FileUnit::buffer("bad.txt", vec![0xffu8, 0xfe])];
    let (out, results) = drive(&mut stage, inputs);

    assert!(out.is_empty());
    match &results[0] {
        Err(StageError::Plugin(error)) => {
            let source = std::error::Error::source(error).unwrap();
            assert!(source.downcast_ref::<std::str::Utf8Error>().is_some());
            assert!(!error.message().is_empty());
        }
        other => panic!("expected plugin error, got {:?}", other),
    }
}
