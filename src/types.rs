//! Types shared by both signature families

use crate::constants::ID_LEN;

/// The 16-byte identifier `I` binding an LMS tree and its LM-OTS leaves.
pub type Identifier = [u8; ID_LEN];
