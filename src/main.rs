mod app;

use app::SpriteDemo;

lib_app::app_main!(SpriteDemo);
