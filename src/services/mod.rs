// SPDX-License-Identifier: MIT

//! Application services.

pub mod mailer;
pub mod password;
pub mod tokens;

pub use mailer::Mailer;
pub use tokens::TokenIssuer;
