use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};

/// Platform action for showing an exported file or folder to the user.
pub trait PathOpener {
    fn open_path(&self, path: &Path) -> Result<()>;
}

/// Opens paths with the desktop's default handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl PathOpener for SystemOpener {
    fn open_path(&self, path: &Path) -> Result<()> {
        info!("Opening: {}", path.display());
        open_native(path)
    }
}

#[cfg(target_os = "windows")]
fn open_native(path: &Path) -> Result<()> {
    use std::ffi::OsStr;
    use std::iter::once;
    use std::os::windows::ffi::OsStrExt;
    use std::ptr::{null, null_mut};
    use winapi::um::shellapi::ShellExecuteW;
    use winapi::um::winuser::SW_SHOWNORMAL;

    let wide_path: Vec<u16> = path.as_os_str().encode_wide().chain(once(0)).collect();
    let wide_verb: Vec<u16> = OsStr::new("open").encode_wide().chain(once(0)).collect();

    // Values above 32 mean success
    let rc = unsafe {
        ShellExecuteW(null_mut(), wide_verb.as_ptr(), wide_path.as_ptr(), null(), null(), SW_SHOWNORMAL)
    };
    if rc as isize <= 32 {
        return Err(Error::Io(std::io::Error::other(format!("ShellExecuteW failed with code {}", rc as isize))));
    }
    Ok(())
}

#[cfg(not(target_os = "windows"))]
fn open_native(path: &Path) -> Result<()> {
    let program = if cfg!(target_os = "macos") { "open" } else { "xdg-open" };
    let status = std::process::Command::new(program).arg(path).status()?;
    if !status.success() {
        return Err(Error::Io(std::io::Error::other(format!("{} exited with {}", program, status))));
    }
    Ok(())
}
