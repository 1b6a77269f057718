//! Client behaviour against a one-shot local HTTP responder.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use terreplus::api::ApiClient;
use terreplus::capture::PolygonCapture;
use terreplus::domain::GeoPoint;
use terreplus::error::{ApiError, FormError};
use terreplus::form::TerrainForm;

struct Recorded {
    request_line: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Recorded {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Serve `responses` in order, one per connection, and record the requests.
fn serve(responses: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<Recorded>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}/api", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let mut recorded = Vec::new();
        for (status, body) in responses {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();

            let mut headers = Vec::new();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((k, v)) = line.split_once(':') {
                    headers.push((k.trim().to_string(), v.trim().to_string()));
                }
            }

            let length: usize = headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
                .map(|(_, v)| v.parse().unwrap())
                .unwrap_or(0);
            let mut body_buf = vec![0; length];
            reader.read_exact(&mut body_buf).unwrap();

            let mut stream = reader.into_inner();
            write!(
                stream,
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            )
            .unwrap();
            stream.flush().unwrap();

            recorded.push(Recorded {
                request_line: request_line.trim_end().to_string(),
                headers,
                body: String::from_utf8(body_buf).unwrap(),
            });
        }
        recorded
    });

    (base, handle)
}

fn client(base: &str, token: Option<&str>) -> ApiClient {
    ApiClient::new(base, Duration::from_secs(5))
        .unwrap()
        .with_token(token.map(str::to_string))
}

#[test]
fn test_sign_in_sends_credentials() {
    let (base, server) = serve(vec![(
        200,
        r#"{"id":1,"nombre":"Ana","email":"ana@example.com","rol":"inversionista","accessToken":"tok"}"#,
    )]);

    let signed = client(&base, None).sign_in("ana@example.com", "pw").unwrap();
    assert_eq!(signed.access_token.as_deref(), Some("tok"));

    let requests = server.join().unwrap();
    assert_eq!(requests[0].request_line, "POST /api/auth/signin HTTP/1.1");
    assert_eq!(requests[0].header("x-access-token"), None);
    let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(body, serde_json::json!({"email": "ana@example.com", "password": "pw"}));
}

#[test]
fn test_register_then_estimate() {
    let (base, server) = serve(vec![
        (201, r#"{"id": 77, "ubicacion_nombre": "Finca"}"#),
        (200, r#"{"id": 5, "terreno_id": 77, "valor_estimado_hectarea": "3100.5"}"#),
    ]);
    let api = client(&base, Some("tok"));

    let mut capture = PolygonCapture::default();
    for (lat, lng) in [(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)] {
        capture.add_point(GeoPoint::new(lat, lng));
    }

    let mut form = TerrainForm::new();
    form.set_location_name("Finca");
    form.set_area("4");
    form.set_soil_type("Franco");
    form.set_road_distance("2.5");
    form.apply_selection(capture.confirm().unwrap());

    let estimate = form.register_and_estimate(&api, 32).unwrap();
    assert_eq!(form.registered_id(), Some(77));
    assert_eq!(estimate.label(), "$3100.50 / ha");

    let requests = server.join().unwrap();
    assert_eq!(requests[0].request_line, "POST /api/terrain HTTP/1.1");
    assert_eq!(requests[0].header("x-access-token"), Some("tok"));

    let draft: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(draft["tipo_suelo"], "franco");
    assert_eq!(draft["acceso_riego"], 0);
    assert_eq!(draft["lat"], 5.0);
    assert_eq!(draft["lng"], 5.0);
    let ring = draft["poligono"]["coordinates"][0].as_array().unwrap();
    assert_eq!(ring.len(), 5);
    assert_eq!(ring[0], ring[4]);
    assert_eq!(ring[1], serde_json::json!([10.0, 0.0]));

    assert_eq!(requests[1].request_line, "POST /api/ml/estimate HTTP/1.1");
    let body: serde_json::Value = serde_json::from_str(&requests[1].body).unwrap();
    assert_eq!(body, serde_json::json!({"terreno_id": 77, "modelo_id": 32}));
}

#[test]
fn test_backend_message_on_failure() {
    let (base, server) = serve(vec![(
        404,
        r#"{"message":"Terreno no encontrado"}"#,
    )]);

    let err = client(&base, Some("tok")).estimate(999, 32).unwrap_err();
    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Terreno no encontrado");
        }
        other => panic!("unexpected error: {other}"),
    }
    server.join().unwrap();
}

#[test]
fn test_my_terrains_requires_session() {
    let api = client("http://127.0.0.1:9/api", None);
    assert!(matches!(api.my_terrains(), Err(ApiError::Unauthenticated)));
}

#[test]
fn test_failed_registration_keeps_form_unregistered() {
    let (base, server) = serve(vec![(400, r#"{"message":"Área inválida"}"#)]);
    let api = client(&base, Some("tok"));

    let mut form = TerrainForm::new();
    form.set_location_name("Lote");
    form.set_area("1");
    form.set_soil_type("arenoso");
    form.set_road_distance("0");
    let mut capture = PolygonCapture::default();
    for (lat, lng) in [(1.0, 1.0), (1.0, 2.0), (2.0, 2.0)] {
        capture.add_point(GeoPoint::new(lat, lng));
    }
    form.apply_selection(capture.confirm().unwrap());

    let err = form.register(&api).unwrap_err();
    assert!(matches!(err, FormError::Api(ApiError::Status { status: 400, .. })));
    assert_eq!(form.registered_id(), None);
    server.join().unwrap();
}
