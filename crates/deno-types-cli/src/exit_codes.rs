//! Process exit codes.
//! Library errors carry their own code; anything else is treated as a config error.

use deno_types_core::GenError;

pub const EXIT_SUCCESS: i32 = 0;
pub const CONFIG_ERROR: i32 = 1;

pub fn for_error(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<GenError>())
        .map(GenError::exit_code)
        .unwrap_or(CONFIG_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_error_uses_library_code() {
        let err = anyhow::Error::new(GenError::Http {
            url: "u".into(),
            status: "500 Internal Server Error".into(),
        })
        .context("generating package");
        assert_eq!(for_error(&err), 5);

        assert_eq!(for_error(&anyhow::anyhow!("plain")), CONFIG_ERROR);
    }
}
