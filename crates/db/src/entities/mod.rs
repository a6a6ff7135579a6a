//! `SeaORM` entity definitions, one module per table.

pub mod announcements;
pub mod bill_payments;
pub mod building_managers;
pub mod buildings;
pub mod business_owners;
pub mod contracts;
pub mod faqs;
pub mod issue_reports;
pub mod management_transfer_requests;
pub mod messages;
pub mod notifications;
pub mod payments;
pub mod reminders;
pub mod residents;
pub mod sea_orm_active_enums;
pub mod service_requests;
pub mod services;
pub mod sessions;
pub mod subscriptions;
pub mod survey_responses;
pub mod surveys;
pub mod users;
pub mod wallets;
