// Integration tests for the session-scoped chunk pipeline
//
// These verify the core guarantees: chunks of one session are transcribed
// strictly in submission order, one at a time, with the transcript carried
// forward as engine context; failures stay local to their chunk; sessions
// never contaminate each other.

use anyhow::Result;
use live_scribe::{
    ChunkRef, MockEngine, Session, SessionConfig, SessionManager, TranscribeError,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

fn chunk(name: &str) -> ChunkRef {
    ChunkRef::new(PathBuf::from("/nonexistent").join(name))
}

#[tokio::test]
async fn test_chunks_transcribed_in_submission_order() -> Result<()> {
    // The first chunk is the slowest; order must still hold
    let engine = Arc::new(MockEngine::new());
    engine.enqueue_response("one", Duration::from_millis(50));
    engine.enqueue_response("two", Duration::from_millis(10));
    engine.enqueue_response("three", Duration::ZERO);

    let session = Session::new(SessionConfig::default(), engine.clone());

    // All three queued before any completes
    let r1 = session.submit_chunk(chunk("c1.ogg"));
    let r2 = session.submit_chunk(chunk("c2.ogg"));
    let r3 = session.submit_chunk(chunk("c3.ogg"));

    assert_eq!(r1.await??, "one");
    assert_eq!(r2.await??, "two");
    assert_eq!(r3.await??, "three");

    assert_eq!(session.transcript().await, "one two three");

    Ok(())
}

#[tokio::test]
async fn test_engine_calls_never_overlap_within_a_session() -> Result<()> {
    let engine = Arc::new(MockEngine::new().with_delay(Duration::from_millis(20)));
    let session = Session::new(SessionConfig::default(), engine.clone());

    let receivers: Vec<_> = (0..5)
        .map(|i| session.submit_chunk(chunk(&format!("c{}.ogg", i))))
        .collect();

    for rx in receivers {
        rx.await??;
    }

    assert_eq!(
        engine.max_in_flight(),
        1,
        "a session must never have two engine calls in flight"
    );

    Ok(())
}

#[tokio::test]
async fn test_sessions_are_isolated_and_run_concurrently() -> Result<()> {
    let engine = Arc::new(
        MockEngine::new()
            .echoing_stem()
            .with_delay(Duration::from_millis(10)),
    );
    let manager = SessionManager::new(engine.clone());

    let a = manager.create_session(SessionConfig::default()).await;
    let b = manager.create_session(SessionConfig::default()).await;

    let (a1, b1) = tokio::join!(
        manager.submit_chunk(&a, chunk("alpha.ogg")),
        manager.submit_chunk(&b, chunk("uno.ogg")),
    );
    let (a2, b2) = tokio::join!(
        manager.submit_chunk(&a, chunk("beta.ogg")),
        manager.submit_chunk(&b, chunk("dos.ogg")),
    );

    assert_eq!(a1?, "alpha");
    assert_eq!(b1?, "uno");
    assert_eq!(a2?, "beta");
    assert_eq!(b2?, "dos");

    assert_eq!(manager.transcript(&a).await?, "alpha beta");
    assert_eq!(manager.transcript(&b).await?, "uno dos");

    // Context prompts never cross session boundaries
    for call in engine.calls() {
        let stem = call.audio.file_stem().unwrap().to_string_lossy().into_owned();
        match stem.as_str() {
            "alpha" | "uno" => assert_eq!(call.context, ""),
            "beta" => assert_eq!(call.context, "alpha"),
            "dos" => assert_eq!(call.context, "uno"),
            other => panic!("unexpected chunk {}", other),
        }
    }

    Ok(())
}

#[tokio::test]
async fn test_failed_chunk_does_not_stall_the_lane() -> Result<()> {
    let engine = Arc::new(MockEngine::new());
    engine.enqueue_response("first", Duration::ZERO);
    engine.enqueue_failure();
    engine.enqueue_response("third", Duration::ZERO);

    let session = Session::new(SessionConfig::default(), engine);

    let r1 = session.submit_chunk(chunk("c1.ogg"));
    let r2 = session.submit_chunk(chunk("c2.ogg"));
    let r3 = session.submit_chunk(chunk("c3.ogg"));

    assert_eq!(r1.await??, "first");
    assert!(matches!(
        r2.await?,
        Err(TranscribeError::EngineFailure { .. })
    ));
    assert_eq!(r3.await??, "third");

    // Failed chunk's text never entered the transcript
    assert_eq!(session.transcript().await, "first third");

    Ok(())
}

#[tokio::test]
async fn test_submit_to_unknown_session_fails_without_side_effects() {
    let engine = Arc::new(MockEngine::new());
    let manager = SessionManager::new(engine.clone());

    let result = manager.submit_chunk("xyz", chunk("c1.ogg")).await;
    assert!(matches!(
        result,
        Err(TranscribeError::SessionNotFound { .. })
    ));
    assert!(engine.calls().is_empty(), "engine must not be invoked");

    let result = manager.transcript("xyz").await;
    assert!(matches!(
        result,
        Err(TranscribeError::SessionNotFound { .. })
    ));
}

#[tokio::test]
async fn test_zero_chunk_session_has_empty_transcript() -> Result<()> {
    let manager = SessionManager::new(Arc::new(MockEngine::new()));
    let id = manager.create_session(SessionConfig::default()).await;

    let first = manager.transcript(&id).await?;
    let second = manager.transcript(&id).await?;

    assert_eq!(first, "");
    assert_eq!(second, first, "reads without submissions must be identical");

    Ok(())
}

#[tokio::test]
async fn test_persistent_engine_failure_leaves_transcript_empty() -> Result<()> {
    let engine = Arc::new(MockEngine::new().with_failure());
    let manager = SessionManager::new(engine);
    let id = manager.create_session(SessionConfig::default()).await;

    for i in 0..2 {
        let result = manager
            .submit_chunk(&id, chunk(&format!("c{}.ogg", i)))
            .await;
        assert!(matches!(
            result,
            Err(TranscribeError::EngineFailure { .. })
        ));
    }

    assert_eq!(manager.transcript(&id).await?, "");

    Ok(())
}

#[tokio::test]
async fn test_overlapping_submissions_keep_order() -> Result<()> {
    // The spec's example scenario: chunk B arrives while chunk A is still
    // being transcribed
    let engine = Arc::new(MockEngine::new());
    engine.enqueue_response("hello", Duration::from_millis(100));
    engine.enqueue_response("world", Duration::ZERO);

    let manager = Arc::new(SessionManager::new(engine));
    let id = manager.create_session(SessionConfig::default()).await;

    let m = Arc::clone(&manager);
    let id_a = id.clone();
    let a = tokio::spawn(async move { m.submit_chunk(&id_a, chunk("a.ogg")).await });

    // Give chunk A time to enter the lane before B is submitted
    tokio::time::sleep(Duration::from_millis(20)).await;

    let m = Arc::clone(&manager);
    let id_b = id.clone();
    let b = tokio::spawn(async move { m.submit_chunk(&id_b, chunk("b.ogg")).await });

    assert_eq!(a.await??, "hello");
    assert_eq!(b.await??, "world");
    assert_eq!(manager.transcript(&id).await?, "hello world");

    Ok(())
}

#[tokio::test]
async fn test_transcript_is_fed_back_as_context() -> Result<()> {
    let engine = Arc::new(MockEngine::new().echoing_stem());
    let session = Session::new(SessionConfig::default(), engine.clone());

    session.submit_chunk(chunk("hello.ogg")).await??;
    session.submit_chunk(chunk("world.ogg")).await??;

    let calls = engine.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].context, "");
    assert_eq!(calls[1].context, "hello");

    Ok(())
}

#[tokio::test]
async fn test_session_config_reaches_the_engine() -> Result<()> {
    let engine = Arc::new(MockEngine::new());
    let manager = SessionManager::new(engine.clone());

    let id = manager
        .create_session(SessionConfig {
            model: "small.en".to_string(),
            language: "de".to_string(),
        })
        .await;

    manager.submit_chunk(&id, chunk("a.ogg")).await?;

    let calls = engine.calls();
    assert_eq!(calls[0].model, "small.en");
    assert_eq!(calls[0].language, "de");

    Ok(())
}

#[tokio::test]
async fn test_audio_removed_on_success_and_retained_on_failure() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let ok_path = dir.path().join("ok.ogg");
    let bad_path = dir.path().join("bad.ogg");
    tokio::fs::write(&ok_path, b"fake audio").await?;
    tokio::fs::write(&bad_path, b"fake audio").await?;

    let engine = Arc::new(MockEngine::new());
    engine.enqueue_response("ok", Duration::ZERO);
    engine.enqueue_failure();

    let session = Session::new(SessionConfig::default(), engine);

    session.submit_chunk(ChunkRef::new(&ok_path)).await??;
    let failed = session.submit_chunk(ChunkRef::new(&bad_path)).await?;
    assert!(failed.is_err());

    assert!(!ok_path.exists(), "successful chunk audio should be deleted");
    assert!(bad_path.exists(), "failed chunk audio should be retained");

    Ok(())
}

#[tokio::test]
async fn test_empty_chunk_text_adds_no_separator() -> Result<()> {
    let engine = Arc::new(MockEngine::new());
    engine.enqueue_response("", Duration::ZERO);
    engine.enqueue_response("words", Duration::ZERO);

    let session = Session::new(SessionConfig::default(), engine);

    assert_eq!(session.submit_chunk(chunk("a.ogg")).await??, "");
    assert_eq!(session.submit_chunk(chunk("b.ogg")).await??, "words");

    assert_eq!(session.transcript().await, "words");

    Ok(())
}
