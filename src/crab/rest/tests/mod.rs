use serde_json::json;

use super::*;
use crate::test_utils::MockRest;

#[test]
fn server_url_test() {
    assert_eq!(
        "/crabserver/prod/workflow",
        server_url("prod", "workflow").unwrap()
    );
    assert_eq!(
        "/crabserver/preprod/info",
        server_url("preprod", "info").unwrap()
    );
    assert_eq!("/crabserver/dev/info", server_url("private", "info").unwrap());

    let err = server_url("staging", "info").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CrabError>(),
        Some(CrabError::Configuration(_))
    ));
}

#[test]
fn server_info_returns_the_first_record() {
    let rest = MockRest::answering(json!({
        "result": [{"cacheSSL": "https://cmsweb.cern.ch/crabcache"}, {"ignored": true}]
    }));

    let info = get_server_info(
        &rest,
        "backendurls",
        "cmsweb.cern.ch",
        "/crabserver/prod/info",
        &[("extra", "1")],
    )
    .unwrap();

    assert_eq!(json!({"cacheSSL": "https://cmsweb.cern.ch/crabcache"}), info);

    let requests = rest.requests.borrow();
    assert_eq!(1, requests.len());
    assert_eq!("cmsweb.cern.ch", requests[0].0);
    assert_eq!("/crabserver/prod/info", requests[0].1);
    assert_eq!(
        vec![
            ("subresource".to_string(), "backendurls".to_string()),
            ("extra".to_string(), "1".to_string())
        ],
        requests[0].2
    );
}

#[test]
fn server_info_without_result() {
    for body in [json!({}), json!({"result": []}), json!({"result": "none"})] {
        let rest = MockRest::answering(body);

        let err = get_server_info(&rest, "backendurls", "host", "/info", &[]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CrabError>(),
            Some(CrabError::Communication(_))
        ));
    }
}

#[test]
fn server_info_passes_transport_errors() {
    let rest = MockRest::unreachable();

    assert!(get_server_info(&rest, "backendurls", "host", "/info", &[]).is_err());
}
