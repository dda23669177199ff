// Copyright 2025 Traceboard Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Traceboard Core
//!
//! Data model for OpenTelemetry-style trace exports: tolerant span decoding,
//! resource attribute resolution, and the span tree walker that every
//! analysis view is built on.

pub mod resource;
pub mod span;
pub mod walk;

pub use resource::{resolve_service_name, UNKNOWN_SERVICE};
pub use span::{SpanRecord, UNKNOWN_OPERATION};
pub use walk::{walk_service_spans, walk_spans, ServiceSpans};
