//! Windows Credential Manager backend.
//!
//! All FFI for the vault lives in this module. Strings cross the boundary as
//! NUL-terminated UTF-16 buffers owned on the Rust side for the duration of
//! each call; the only foreign-owned memory is the `CREDENTIALW` returned by
//! `CredReadW`, which is copied out and released with `CredFree` before
//! returning.

#![allow(unsafe_code)]

use std::ffi::c_void;
use std::ptr;

use tracing::debug;
use windows_sys::Win32::Foundation::{GetLastError, ERROR_NOT_FOUND, FILETIME};
use windows_sys::Win32::Security::Credentials::{
    CredDeleteW, CredFree, CredReadW, CredWriteW, CREDENTIALW, CRED_PERSIST_LOCAL_MACHINE,
    CRED_TYPE_GENERIC,
};

use crate::backend::{BackendKind, SecretBackend};
use crate::blob::VaultBlob;
use crate::error::{CredentialError, Result};

/// User name recorded on the credential.
const USER_NAME: &str = "high-tide";

/// Generic credential addressed by target name.
pub struct CredentialVaultBackend {
    target: String,
}

impl CredentialVaultBackend {
    pub fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
        }
    }
}

fn wide(text: &str) -> Vec<u16> {
    text.encode_utf16().chain(std::iter::once(0)).collect()
}

fn last_error() -> u32 {
    // SAFETY: reads thread-local error state, no arguments.
    unsafe { GetLastError() }
}

impl SecretBackend for CredentialVaultBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::CredentialVault
    }

    fn read(&self) -> Result<Option<String>> {
        let target = wide(&self.target);
        let mut credential: *mut CREDENTIALW = ptr::null_mut();

        // SAFETY: `target` is NUL-terminated and outlives the call;
        // `credential` is a valid out-pointer.
        let ok = unsafe { CredReadW(target.as_ptr(), CRED_TYPE_GENERIC, 0, &mut credential) };
        if ok == 0 {
            let code = last_error();
            if code == ERROR_NOT_FOUND {
                debug!(target = %self.target, "No vault credential");
                return Ok(None);
            }
            return Err(CredentialError::Backend(format!("CredReadW failed: {code}")));
        }

        // SAFETY: CredReadW succeeded, so `credential` points at a valid
        // CREDENTIALW whose blob spans `CredentialBlobSize` bytes. The bytes
        // are copied before the allocation is freed.
        let bytes = unsafe {
            let cred = &*credential;
            let bytes = if cred.CredentialBlobSize == 0 || cred.CredentialBlob.is_null() {
                Vec::new()
            } else {
                std::slice::from_raw_parts(cred.CredentialBlob, cred.CredentialBlobSize as usize)
                    .to_vec()
            };
            CredFree(credential as *const c_void);
            bytes
        };

        if bytes.is_empty() {
            return Ok(None);
        }
        VaultBlob::from_bytes(bytes).decode().map(Some)
    }

    fn write(&self, payload: &str) -> Result<()> {
        let mut blob = VaultBlob::encode(payload)?;
        let mut target = wide(&self.target);
        let mut user = wide(USER_NAME);

        let credential = CREDENTIALW {
            Flags: 0,
            Type: CRED_TYPE_GENERIC,
            TargetName: target.as_mut_ptr(),
            Comment: ptr::null_mut(),
            LastWritten: FILETIME {
                dwLowDateTime: 0,
                dwHighDateTime: 0,
            },
            CredentialBlobSize: blob.len_u32(),
            CredentialBlob: blob.as_mut_bytes().as_mut_ptr(),
            Persist: CRED_PERSIST_LOCAL_MACHINE,
            AttributeCount: 0,
            Attributes: ptr::null_mut(),
            TargetAlias: ptr::null_mut(),
            UserName: user.as_mut_ptr(),
        };

        // SAFETY: every pointer in `credential` refers to a buffer owned by
        // this frame that outlives the call; the vault copies what it keeps.
        let ok = unsafe { CredWriteW(&credential, 0) };
        if ok == 0 {
            return Err(CredentialError::Backend(format!(
                "CredWriteW failed: {}",
                last_error()
            )));
        }

        debug!(target = %self.target, bytes = blob.len(), "Stored vault credential");
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        let target = wide(&self.target);

        // SAFETY: `target` is NUL-terminated and outlives the call.
        let ok = unsafe { CredDeleteW(target.as_ptr(), CRED_TYPE_GENERIC, 0) };
        if ok == 0 {
            let code = last_error();
            if code != ERROR_NOT_FOUND {
                return Err(CredentialError::Backend(format!("CredDeleteW failed: {code}")));
            }
        }
        Ok(())
    }
}
