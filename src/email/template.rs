use crate::generator::common::escape_html;

pub fn certificate_subject(name: &str) -> String {
    format!("🎉 Your Certificate is Ready - {}", name)
}

/// HTML body of the certificate email. The name is escaped.
pub fn certificate_email_body(name: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Certificate Ready</title>
</head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
    <div style="background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); padding: 30px; border-radius: 10px; text-align: center; margin-bottom: 30px;">
        <h1 style="color: white; margin: 0; font-size: 28px;">🎉 Certificate Ready!</h1>
    </div>
    <div style="background: #f8f9fa; padding: 30px; border-radius: 10px; margin-bottom: 30px;">
        <h2 style="color: #2c3e50; margin-top: 0;">Dear {name},</h2>
        <p>Congratulations! Your business certificate has been successfully generated and is ready for download.</p>
        <div style="background: white; padding: 20px; border-radius: 8px; border-left: 4px solid #667eea; margin: 20px 0;">
            <h3 style="margin-top: 0; color: #667eea;">📄 What's Included:</h3>
            <ul style="margin-bottom: 0;">
                <li><strong>PDF Version:</strong> Perfect for printing and official use</li>
                <li><strong>JPG Version:</strong> Ideal for digital sharing and web use</li>
            </ul>
        </div>
        <p>Both versions are attached to this email. Please save them in a secure location for your records.</p>
    </div>
    <div style="text-align: center; padding: 20px; background: #2c3e50; color: white; border-radius: 10px;">
        <p style="margin: 0;">Certificate Authority Team</p>
    </div>
</body>
</html>
"#,
        name = escape_html(name)
    )
}
