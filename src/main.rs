use ferrum::uci::Uci;

fn main() {
    Uci::new().run();
}
