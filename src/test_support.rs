//! In-process upstream stand-in for network-facing tests

use std::collections::HashMap;
use std::convert::Infallible;
use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};

use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server, StatusCode};

type Routes = Arc<HashMap<String, (u16, String)>>;

/// Serves canned `(status, body)` pairs keyed by request path and records
/// every request URI it receives
pub struct FixtureServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FixtureServer {
    pub async fn start(routes: &[(&str, u16, &str)]) -> Self {
        let routes: Routes = Arc::new(
            routes
                .iter()
                .map(|(path, status, body)| (path.to_string(), (*status, body.to_string())))
                .collect(),
        );
        let requests = Arc::new(Mutex::new(Vec::new()));

        let make_svc = {
            let routes = routes.clone();
            let requests = requests.clone();
            make_service_fn(move |_conn| {
                let routes = routes.clone();
                let requests = requests.clone();
                async move {
                    Ok::<_, Infallible>(service_fn(move |req: Request<Body>| {
                        let routes = routes.clone();
                        let requests = requests.clone();
                        async move {
                            requests.lock().unwrap().push(req.uri().to_string());
                            let response = match routes.get(req.uri().path()) {
                                Some((status, body)) => Response::builder()
                                    .status(*status)
                                    .header("Content-Type", "application/json")
                                    .body(Body::from(body.clone()))
                                    .unwrap(),
                                None => Response::builder()
                                    .status(StatusCode::NOT_FOUND)
                                    .body(Body::from("Not Found"))
                                    .unwrap(),
                            };
                            Ok::<_, Infallible>(response)
                        }
                    }))
                }
            })
        };

        let server = Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0))).serve(make_svc);
        let addr = server.local_addr();
        tokio::spawn(async move {
            let _ = server.await;
        });

        Self { addr, requests }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Request URIs (path and query) received so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Base URL of a port nothing is listening on
pub fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
