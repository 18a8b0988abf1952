/*!
# Collaborator Commission Dashboard

A small reporting dashboard for collaborator (CTV) commissions, built in Rust.

## Overview

The application pulls a table of collaborator activity from a Google Sheet,
lets a collaborator log in against the credential columns of that table, and
renders their commission report for a selected date range: the tiered total
payout, the activity table, status breakdowns with bar charts, and a daily
paid-order line chart.

## Architecture

The application follows a client-server architecture:

### Frontend Layer
- **Technologies**: HTML, CSS, vanilla JavaScript
- **Key Components**:
  - Login form - Collaborator credential entry
  - Date range picker - Start/end date selection and filter action
  - Report view - Commission total, activity table, tally summaries
  - Chart images - Bar and line charts rendered server-side

### Backend Layer
- **Technologies**: Rust, axum
- **Core Components**:
  - Data Source Adapter - Fetches the raw table from the Sheets API
  - Record Normalizer - Typed records, required-column validation, date parsing
  - Commission Engine - Per-day paid-order counts and tiered payout totals
  - Query/Filter Layer - Collaborator and date-range filtering
  - Session/Auth Shell - Credential lookup and cookie sessions
  - Presentation Shell - Tallies, VND formatting, plotters charts

## Key Features

- Tiered daily commission (three per-order rates by daily paid-order count)
- Full date sequence in every report: zero-activity days stay visible
- Payment-state and case-status breakdowns, text and bar chart
- Per-request fetch-and-recompute; no caching, no persisted derived state
- Credential check against the sheet's User/Password columns (behavioral
  parity with the upstream sheet; see `auth` module notes)

## Modules

- **sheets**: Google Sheets fetch and payload parsing
- **record**: Record struct and table normalization
- **commission**: Tier function and date-range commission computation
- **query**: Collaborator/date-range filtering
- **auth**: Credential lookup and session management
- **report**: Tallies, trimmed display table, VND formatting
- **chart**: Chart generation from report data
- **app**: Routing and request handlers

## REST API Endpoints

- `/` - Login page
- `/login`, `/logout` - Session management
- `/dashboard` - Report page (requires session)
- `/api/report?start&end` - Full report as JSON
- `/chart/{daily,payments,status}.png?start&end` - Chart images
*/

// Re-export all modules so they appear in the documentation
pub mod auth;
#[cfg(feature = "web")]
pub mod chart;
pub mod commission;
pub mod query;
pub mod record;
pub mod report;
pub mod sheets;

#[cfg(feature = "web")]
pub mod app;

/// Re-export everything from these modules to make it easier to use
pub use auth::*;
pub use commission::*;
pub use query::*;
pub use record::*;
pub use report::*;
pub use sheets::*;
