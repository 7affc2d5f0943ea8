// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module

mod address_properties;
mod depth_properties;
mod flow_properties;
mod hostname_properties;
