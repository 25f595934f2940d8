use crate::conversation::keyboards;
use crate::conversation::render::Responder;
use crate::conversation::texts;

pub async fn greet(responder: &mut Responder<'_>) -> anyhow::Result<()> {
    responder
        .say(texts::GREETING, Some(keyboards::main_menu()))
        .await
}
