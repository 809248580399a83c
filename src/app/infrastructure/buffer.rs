/// Copy the contents of an FLTK `TextBuffer` into a Rust `String`.
///
/// `TextBuffer::text()` in fltk-rs copies the `malloc`'d string returned by
/// `Fl_Text_Buffer_text` but never frees it, so every keystroke that reads a
/// source buffer would leak a full copy of it. This calls the C API directly
/// and releases the allocation.
pub fn read_buffer_text(buf: &fltk::text::TextBuffer) -> String {
    unsafe extern "C" {
        fn Fl_Text_Buffer_text(buf: *mut std::ffi::c_void) -> *mut std::ffi::c_char;
        fn free(ptr: *mut std::ffi::c_void);
    }

    // SAFETY: `buf.as_ptr()` is a live Fl_Text_Buffer owned by `buf`. The
    // returned pointer is either null or a NUL-terminated malloc'd copy that
    // we own and free exactly once after copying it.
    unsafe {
        let inner = buf.as_ptr() as *mut std::ffi::c_void;
        let ptr = Fl_Text_Buffer_text(inner);
        if ptr.is_null() {
            return String::new();
        }
        let text = std::ffi::CStr::from_ptr(ptr).to_string_lossy().into_owned();
        free(ptr as *mut std::ffi::c_void);
        text
    }
}
