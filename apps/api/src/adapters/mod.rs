//! SeaORM adapters. Functions here return `DbErr`; the repos layer maps to `DomainError`.

pub mod accounts_sea;
