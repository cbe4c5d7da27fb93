// src/windows_api.rs

use crate::errors::ProbeError;
use log::debug;
use std::ffi::OsString;
use std::os::windows::ffi::OsStringExt;
use std::path::Path;
use windows::Win32::Foundation::{CloseHandle, HANDLE, HWND, MAX_PATH};
use windows::Win32::System::ProcessStatus::GetModuleFileNameExW;
use windows::Win32::System::Threading::{OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_VM_READ};
use windows::Win32::UI::WindowsAndMessaging::{
    GetForegroundWindow, GetWindowTextW, GetWindowThreadProcessId,
};

const MAX_TITLE_LENGTH: usize = 512;

/// Executable file name and title of the foreground window.
pub fn get_foreground_window_info() -> Result<(String, String), ProbeError> {
    unsafe {
        let hwnd = GetForegroundWindow();
        if hwnd.is_invalid() {
            return Err(ProbeError::Unavailable("no foreground window".to_string()));
        }

        let mut process_id: u32 = 0;
        let thread_id = GetWindowThreadProcessId(hwnd, Some(&mut process_id));
        debug!("Foreground HWND {:?}: PID {} (thread {})", hwnd, process_id, thread_id);
        if thread_id == 0 || process_id == 0 {
            return Err(ProbeError::Unavailable(format!(
                "no owning process for window {hwnd:?}"
            )));
        }

        let app_name = get_process_executable_name(process_id)?;
        let title = get_hwnd_title(hwnd);
        Ok((app_name, title))
    }
}

unsafe fn get_hwnd_title(hwnd: HWND) -> String {
    let mut title_buf: Vec<u16> = vec![0; MAX_TITLE_LENGTH];
    let title_len = unsafe { GetWindowTextW(hwnd, &mut title_buf) };
    match usize::try_from(title_len) {
        Ok(len) if len > 0 => OsString::from_wide(&title_buf[..len]).to_string_lossy().into_owned(),
        _ => String::new(),
    }
}

unsafe fn get_process_executable_name(process_id: u32) -> Result<String, ProbeError> {
    let process_handle = unsafe {
        OpenProcess(PROCESS_QUERY_INFORMATION | PROCESS_VM_READ, false, process_id)
    }
    .map_err(|e| ProbeError::Unavailable(format!("OpenProcess failed for PID {process_id}: {e}")))?;

    struct HandleGuard(HANDLE);
    impl Drop for HandleGuard {
        fn drop(&mut self) {
            if !self.0.is_invalid() {
                let _ = unsafe { CloseHandle(self.0) };
            }
        }
    }
    let _handle_guard = HandleGuard(process_handle);

    let mut exe_path_buf: Vec<u16> = vec![0; MAX_PATH as usize];
    let path_len =
        unsafe { GetModuleFileNameExW(Some(process_handle), None, &mut exe_path_buf) } as usize;
    if path_len == 0 {
        // The process may have exited between the window lookup and here.
        return Err(ProbeError::Unavailable(format!(
            "GetModuleFileNameExW failed for PID {process_id}: {:?}",
            windows::core::Error::from_win32()
        )));
    }

    let os_string = OsString::from_wide(&exe_path_buf[..path_len]);
    Path::new(&os_string)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            ProbeError::Unavailable(format!("no file name in path for PID {process_id}"))
        })
}
