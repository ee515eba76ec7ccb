//! Sample record builders for end-to-end scenarios (teacher pattern:
//! `mocks::fixtures` factory functions).

use triad_core::model::{Context, FactCategory, IdentityFact, Role};
use triad_core::{WriteRequest, WriteResult};

pub fn user_message(content: impl Into<String>) -> WriteRequest {
    WriteRequest::new(content, Role::User)
}

pub fn assistant_message(content: impl Into<String>) -> WriteRequest {
    WriteRequest::new(content, Role::Assistant)
}

pub fn identity_fact(key: impl Into<String>, value: impl Into<String>) -> IdentityFact {
    IdentityFact::new_explicit(key, value, FactCategory::Identity)
}

pub fn family_message(content: impl Into<String>) -> WriteRequest {
    WriteRequest::new(content, Role::User).with_context(Context::Family)
}

pub fn assert_write_succeeded(result: &WriteResult) {
    assert!(result.success, "expected write to succeed, got: {:?}", result);
}
