fn main() {
    lltrace::cli::run();
}
