use log::info;
use swtcef_chromium::cef;

pub struct App;

impl cef::App for App {
    fn on_before_command_line_processing(
        &mut self,
        process_type: String,
        _command_line: &mut cef::CommandLine,
    ) {
        info!("Engine {process_type} sub-process started");
    }
}
