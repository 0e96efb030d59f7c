//! Database entry types
//!
//! Database entries are references to stored objects together with their mode, as
//! they appear inside tree objects.

pub mod database_entry;
