use snafu::{Location, Snafu};
use tokio_tungstenite::tungstenite;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Snafu, Debug)]
#[snafu(module, visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to connect to ais stream, url: '{url}'"))]
    Connect {
        #[snafu(implicit)]
        location: Location,
        url: String,
        #[snafu(source)]
        error: tungstenite::Error,
    },
    #[snafu(display("Failed to serialize the subscription request"))]
    Serialize {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: serde_json::Error,
    },
    #[snafu(display("Failed to send the subscription request"))]
    Subscribe {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: tungstenite::Error,
    },
    #[snafu(display("Transport error on the ais stream"))]
    Transport {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: tungstenite::Error,
    },
    #[snafu(display("Ais stream closed unexpectedly"))]
    StreamClosed {
        #[snafu(implicit)]
        location: Location,
    },
}

#[derive(Snafu, Debug)]
#[snafu(module, visibility(pub))]
pub enum DecodeError {
    #[snafu(display("Ais frame is not valid utf-8"))]
    Utf8 {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: std::str::Utf8Error,
    },
    #[snafu(display("Malformed ais frame"))]
    Json {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: serde_json::Error,
    },
    #[snafu(display("Ais frame is missing the required field '{field}'"))]
    MissingField {
        #[snafu(implicit)]
        location: Location,
        field: &'static str,
    },
}
