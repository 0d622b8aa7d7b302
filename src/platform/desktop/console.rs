use windows_sys::Win32::System::Console::FreeConsole;

/// Drops the console window inherited from the launching shell so the app
/// starts as a plain desktop window.
pub fn detach_console() {
    unsafe {
        let _ = FreeConsole();
    }
}
