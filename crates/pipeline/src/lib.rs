//! Reportwire publication and delivery pipeline
//!
//! The two orchestrators at the center of the system:
//!
//! - [`ReportPublisher`] uploads report bytes to the blob store, registers
//!   them with the record store (which alone assigns the canonical name),
//!   and renames the stored blob to match.
//! - [`ReportDispatcher`] resolves a contact, transmits a message through
//!   the gateway, and records the attempt in the delivery ledger.
//!
//! Both are synchronous single-attempt pipelines: one invocation performs
//! its steps strictly in order and returns exactly one outcome. There is
//! no retry, no idempotence, and no shared mutable state — collaborators
//! are handed in once at construction and own their own concurrency.

pub mod dispatch;
pub mod publish;

pub use dispatch::{DeliveryReport, DispatchError, ReportDispatcher};
pub use publish::{PublishError, PublishedReport, ReportPublisher};
