// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use fitness_sync::error::{AppError, Surface};

#[test]
fn test_is_unauthorized_matches() {
    assert!(AppError::Unauthorized.is_unauthorized());

    let err = AppError::Gateway("Unauthorized".to_string());
    assert!(err.is_unauthorized());

    let err = AppError::Gateway("request unauthorized: token expired".to_string());
    assert!(err.is_unauthorized());

    let err = AppError::Gateway(AppError::GATEWAY_UNAUTHORIZED.to_string());
    assert!(err.is_unauthorized());
}

#[test]
fn test_is_unauthorized_no_match() {
    let err = AppError::Gateway("workout not found".to_string());
    assert!(!err.is_unauthorized());

    let err = AppError::Identity("unauthorized".to_string());
    assert!(!err.is_unauthorized());

    let err = AppError::Validation("weight is required".to_string());
    assert!(!err.is_unauthorized());
}

#[test]
fn test_surface() {
    assert_eq!(AppError::Validation("x".into()).surface(), Surface::Inline);
    assert_eq!(AppError::Identity("x".into()).surface(), Surface::Inline);
    assert_eq!(AppError::Gateway("x".into()).surface(), Surface::Alert);
    assert_eq!(AppError::Permission("x".into()).surface(), Surface::Alert);
    assert_eq!(AppError::Unauthorized.surface(), Surface::Alert);
}

#[test]
fn test_notice_hides_internal_details() {
    let notice = AppError::Internal(anyhow::anyhow!("db password leaked")).notice();
    assert_eq!(notice.error, "internal_error");
    assert!(notice.details.is_none());

    let json = serde_json::to_value(AppError::Gateway("boom".into()).notice()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "surface": "alert", "error": "gateway_error", "details": "boom" })
    );
}
