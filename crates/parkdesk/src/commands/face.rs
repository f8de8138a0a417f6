//! Face recognition handlers.

use parkdesk_core::{Command as CoreCommand, CommandResult, Controller, FaceEnrollRequest, FaceMatch};

use crate::cli::{FaceArgs, FaceCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(m: &FaceMatch) -> String {
    if !m.matched {
        return "Không nhận diện được khuôn mặt".into();
    }
    let confidence = m
        .confidence
        .map_or_else(|| "-".into(), |c| format!("{:.1}%", c * 100.0));
    [
        format!("Khách hàng:  {}", output::opt(m.user_id.as_ref())),
        format!("Họ tên:      {}", output::opt(m.full_name.as_ref())),
        format!("Độ tin cậy:  {confidence}"),
    ]
    .join("\n")
}

fn print_match(m: &FaceMatch, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(&global.output, m, detail, |m| {
        m.user_id.as_ref().map(ToString::to_string).unwrap_or_default()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle(
    controller: &Controller,
    args: FaceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        FaceCommand::Recognize { image } => {
            let pb = util::spinner("Đang nhận diện...", global.quiet);
            let found = controller.recognize_face(&image).await;
            pb.finish_and_clear();
            print_match(&found?, global)
        }

        FaceCommand::Register { user_id, image } => {
            let cmd = CoreCommand::EnrollFace(FaceEnrollRequest {
                user_id: util::id(&user_id),
                image,
            });
            let message = cmd.success_message();
            if let CommandResult::Face(m) = controller.execute(cmd).await? {
                output::notice(message, global.quiet);
                print_match(&m, global)?;
            }
            Ok(())
        }
    }
}
