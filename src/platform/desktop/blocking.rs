// Desktop renders synchronously, so file and db work can run in place; the
// indirection keeps a seam for platforms that must hop off the UI thread.
pub fn run_blocking<F, T>(f: F) -> T
where
    F: FnOnce() -> T,
{
    f()
}
