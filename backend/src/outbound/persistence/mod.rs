//! Report persistence adapters.
//!
//! Only an in-process store ships today. It honours the same conditional
//! write contract a database adapter would: status and content writes apply
//! only when the stored status still matches what the caller read.
//!
//! # Example
//!
//! ```ignore
//! use roadwatch::outbound::persistence::InMemoryReportRepository;
//!
//! let repository = Arc::new(InMemoryReportRepository::new());
//! repository.save(&report).await?;
//! ```

mod in_memory_report_repository;

pub use in_memory_report_repository::InMemoryReportRepository;
