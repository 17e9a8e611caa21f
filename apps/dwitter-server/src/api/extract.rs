// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request body extraction.

use axum::extract::FromRequest;

use crate::error::ApiError;

/// `Json` whose rejection is a 400 with the usual `{"message"}` body.
///
/// Missing content type, unparsable JSON and wrong field types all come back
/// as 400 carrying the parser's message.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
