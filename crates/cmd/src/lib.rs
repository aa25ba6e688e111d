// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

pub mod cli;
pub mod config;
pub mod error_utils;
pub mod inode;
pub mod mount;
