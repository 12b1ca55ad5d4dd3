fn main() {
    aidl::cli::run();
}
