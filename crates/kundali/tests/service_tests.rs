use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use kundali::chat::{ChatBackend, ChatRequest, ChatRole, Chatbot};
use kundali::error::{ChatError, EphemerisError, KundaliError, LookupError};
use kundali::ephemeris::{Ephemeris, GeoLocation, SiderealChart};
use kundali::geocode::Geocoder;
use kundali::graha::Planet;
use kundali::{BirthDetails, KundaliResponse, KundaliService};
use kundali_config::{ChatSettings, KundaliSettings};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

struct SlowGeocoder {
    calls: AtomicUsize,
}

#[async_trait]
impl Geocoder for SlowGeocoder {
    async fn locate(&self, place: &str) -> Result<GeoLocation, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        if place == "Varanasi" {
            Ok(GeoLocation { lat: 25.3176, lon: 82.9739 })
        } else {
            Err(LookupError::NotFound { place: place.to_string() })
        }
    }
}

struct FixedEphemeris {
    julian_days: Mutex<Vec<f64>>,
}

#[async_trait]
impl Ephemeris for FixedEphemeris {
    async fn sidereal_chart(&self, julian_day: f64, _location: GeoLocation) -> Result<SiderealChart, EphemerisError> {
        if let Ok(mut seen) = self.julian_days.lock() {
            seen.push(julian_day);
        }
        Ok(SiderealChart {
            ascendant: 130.0,
            sun: 15.0,
            moon: 200.0,
            mars: 280.0,
            mercury: 170.0,
            jupiter: 95.0,
            venus: 345.0,
            saturn: 190.0,
            rahu: 45.0,
        })
    }
}

struct FailingEphemeris;

#[async_trait]
impl Ephemeris for FailingEphemeris {
    async fn sidereal_chart(&self, julian_day: f64, _location: GeoLocation) -> Result<SiderealChart, EphemerisError> {
        Err(EphemerisError::CalculationFailed {
            body: "Moon".to_string(),
            julian_day,
            message: "out of range".to_string(),
        })
    }
}

struct StalledEphemeris;

#[async_trait]
impl Ephemeris for StalledEphemeris {
    async fn sidereal_chart(&self, _julian_day: f64, _location: GeoLocation) -> Result<SiderealChart, EphemerisError> {
        tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        Err(EphemerisError::CalculationFailed {
            body: "Sun".to_string(),
            julian_day: 0.0,
            message: "unreachable".to_string(),
        })
    }
}

fn geocoder() -> Arc<SlowGeocoder> {
    Arc::new(SlowGeocoder { calls: AtomicUsize::new(0) })
}

fn fixed_ephemeris() -> Arc<FixedEphemeris> {
    Arc::new(FixedEphemeris { julian_days: Mutex::new(Vec::new()) })
}

#[tokio::test]
async fn test_end_to_end_report() {
    init_logging();
    let ephemeris = fixed_ephemeris();
    let service = KundaliService::new(geocoder(), ephemeris.clone(), &KundaliSettings::default());
    let details = BirthDetails::new("1990-06-15", "10:00", "Varanasi");
    let now = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();

    let report = service.calculate_at(&details, now).await.unwrap();
    assert_eq!(report.current_mahadasha.as_ref().unwrap().lord, Planet::Jupiter);
    assert_eq!(
        report.mahadashas[0].start,
        Utc.with_ymd_and_hms(1990, 6, 15, 4, 30, 0).unwrap()
    );

    // 1990-06-15 04:30 UTC
    let seen = ephemeris.julian_days.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert!((seen[0] - 2448057.6875).abs() < 1e-6);

    let response = KundaliResponse::from(&report);
    assert_eq!(response.summary, report.summary);
}

#[tokio::test]
async fn test_concurrent_requests_share_one_lookup() {
    init_logging();
    let geocoder = geocoder();
    let service = KundaliService::new(geocoder.clone(), fixed_ephemeris(), &KundaliSettings::default());
    let first = BirthDetails::new("1990-06-15", "10:00", "Varanasi");
    let second = BirthDetails::new("1984-01-20", "23:10", " Varanasi");

    let (a, b) = tokio::join!(service.calculate(&first), service.calculate(&second));
    assert!(a.is_ok());
    assert!(b.is_ok());
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    assert_eq!(service.geocode_cache().len(), 1);
}

#[tokio::test]
async fn test_malformed_birth_skips_collaborators() {
    let geocoder = geocoder();
    let service = KundaliService::new(geocoder.clone(), fixed_ephemeris(), &KundaliSettings::default());
    let err = service
        .calculate(&BirthDetails::new("15/06/1990", "10:00", "Varanasi"))
        .await
        .unwrap_err();
    assert!(matches!(err, KundaliError::InputFormat { .. }));
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_place_is_lookup_error() {
    let service = KundaliService::new(geocoder(), fixed_ephemeris(), &KundaliSettings::default());
    let err = service
        .calculate(&BirthDetails::new("1990-06-15", "10:00", "Atlantis"))
        .await
        .unwrap_err();
    assert!(matches!(err, KundaliError::Lookup(LookupError::NotFound { .. })));
    assert!(err.is_input_error());
}

#[tokio::test]
async fn test_ephemeris_failure_surfaces_unchanged() {
    let service = KundaliService::new(geocoder(), Arc::new(FailingEphemeris), &KundaliSettings::default());
    let err = service
        .calculate(&BirthDetails::new("1990-06-15", "10:00", "Varanasi"))
        .await
        .unwrap_err();
    match err {
        KundaliError::Ephemeris(EphemerisError::CalculationFailed { body, .. }) => assert_eq!(body, "Moon"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_stalled_ephemeris_times_out() {
    let mut settings = KundaliSettings::default();
    settings.ephemeris.timeout_secs = 2;
    let service = KundaliService::new(geocoder(), Arc::new(StalledEphemeris), &settings);

    let err = service
        .calculate(&BirthDetails::new("1990-06-15", "10:00", "Varanasi"))
        .await
        .unwrap_err();
    match err {
        KundaliError::Timeout { collaborator, after } => {
            assert_eq!(collaborator, "ephemeris");
            assert_eq!(after, std::time::Duration::from_secs(2));
        }
        other => panic!("unexpected error: {other}"),
    }
}

struct RecordingBackend {
    requests: Mutex<Vec<ChatRequest>>,
    answer: String,
}

#[async_trait]
impl ChatBackend for RecordingBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<String, ChatError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        Ok(self.answer.clone())
    }
}

#[tokio::test]
async fn test_chatbot_sends_summary_and_question() {
    let service = KundaliService::new(geocoder(), fixed_ephemeris(), &KundaliSettings::default());
    let report = service
        .calculate_at(
            &BirthDetails::new("1990-06-15", "10:00", "Varanasi"),
            Utc.with_ymd_and_hms(1990, 6, 15, 4, 30, 0).unwrap() + Duration::days(1),
        )
        .await
        .unwrap();

    let backend = Arc::new(RecordingBackend {
        requests: Mutex::new(Vec::new()),
        answer: "  - Personality: steady\n".to_string(),
    });
    let settings = ChatSettings { temperature: 0.5, ..ChatSettings::default() };
    let chatbot = Chatbot::new(backend.clone(), settings);

    let answer = chatbot.ask(&report.summary, "Tell me about my career").await.unwrap();
    assert_eq!(answer, "- Personality: steady");

    let requests = backend.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].temperature, 0.5);
    assert_eq!(requests[0].messages[0].role, ChatRole::System);
    assert!(requests[0].messages[0].content.ends_with(&report.summary));
    assert_eq!(requests[0].messages[1].content, "Tell me about my career");
}

#[tokio::test]
async fn test_empty_chat_answer_is_an_error() {
    let backend = Arc::new(RecordingBackend {
        requests: Mutex::new(Vec::new()),
        answer: "   ".to_string(),
    });
    let chatbot = Chatbot::new(backend, ChatSettings::default());
    let err = chatbot.ask("summary", "question").await.unwrap_err();
    assert!(matches!(err, KundaliError::Chat(ChatError::EmptyResponse)));
}
