//! HTTP span helpers.

use uuid::Uuid;

/// Replace UUID path segments so routes group in logs.
pub(super) fn normalise_path(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let mut normalised = String::from("/");

    for (index, segment) in path.trim_start_matches('/').split('/').enumerate() {
        if index > 0 {
            normalised.push('/');
        }

        if Uuid::parse_str(segment).is_ok() {
            normalised.push_str("{uuid}");
        } else {
            normalised.push_str(segment);
        }
    }

    normalised
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_segments_are_replaced() {
        assert_eq!(
            normalise_path("/orders/0190b0a4-7c2e-7a4e-9a57-6d8f2f3f2a11/confirm-cod"),
            "/orders/{uuid}/confirm-cod"
        );
        assert_eq!(normalise_path("/healthcheck"), "/healthcheck");
        assert_eq!(normalise_path("/"), "/");
    }
}
